pub const WHEEL_ENDPOINT: &str = "/wheel/getSingleWheel";
pub const CUSTOMER_VERIFY_ENDPOINT: &str = "/customer/verify";
pub const CUSTOMER_CREATE_ENDPOINT: &str = "/customer/create";

pub const EMAIL_TAKEN_SERVER_ERROR: &str = "Email already registered";
pub const PHONE_TAKEN_SERVER_ERROR: &str = "Phone number already registered";

pub const FIRST_NAME_REQUIRED_ERROR: &str = "Please enter your first name";
pub const INVALID_EMAIL_ERROR: &str = "Please enter a valid email address";
pub const PHONE_REQUIRED_ERROR: &str = "Please enter your phone number";
pub const CONSENT_REQUIRED_ERROR: &str = "Please accept the terms to continue";
pub const EMAIL_TAKEN_ERROR: &str = "This email has already been used to play this wheel";
pub const PHONE_TAKEN_ERROR: &str = "This phone number has already been used to play this wheel";
pub const NETWORK_ERROR: &str = "Network error. Please try again";
pub const WHEEL_UNAVAILABLE_ERROR: &str = "This wheel is not available right now";
pub const NOT_VERIFIED_ERROR: &str = "Please verify your details before spinning";
pub const VERIFICATION_PENDING_ERROR: &str = "Checking your details, please wait";
pub const SPIN_IN_PROGRESS_ERROR: &str = "The wheel is already spinning";
pub const ALREADY_PLAYED_ERROR: &str = "You have already played this wheel";

pub const WHEEL_SLOT_CAPACITY: usize = 8;
pub const SPIN_DURATION_MS: u64 = 4600;
pub const MIN_FULL_REVOLUTIONS: u32 = 5;
pub const MAX_FULL_REVOLUTIONS: u32 = 9;
pub const JITTER_FRACTION: f64 = 0.1;

pub const DEFAULT_SEGMENT_COLORS: [&str; 8] = [
    "#f97316",
    "#06b6d4",
    "#8b5cf6",
    "#ec4899",
    "#22c55e",
    "#eab308",
    "#3b82f6",
    "#ef4444",
];
