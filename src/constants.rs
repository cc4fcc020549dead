/// User agent string for HTTP requests
pub const USER_AGENT: &str = "weather-dashboard/0.1.0";

/// OpenWeather API base URL
pub const OPENWEATHER_API_BASE: &str = "http://api.openweathermap.org/data/2.5";

/// Cities processed when none are given on the command line
pub const DEFAULT_CITIES: [&str; 5] = ["Philadelphia", "Seattle", "New York", "Berlin", "Auckland"];

/// Prefix for generated bucket names
pub const BUCKET_PREFIX: &str = "mybucket";

/// Length of the random suffix appended to generated bucket names
pub const BUCKET_SUFFIX_LEN: usize = 8;

/// Region used when `AWS_REGION` is not set
pub const DEFAULT_REGION: &str = "us-east-1";

/// Settings file read at startup and appended to when a bucket name is generated
pub const DEFAULT_SETTINGS_FILE: &str = ".env";

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_BUCKET_NAME: &str = "AWS_BUCKET_NAME";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
pub const ENV_API_BASE: &str = "OPENWEATHER_API_BASE";

/// Chart dimensions in pixels
pub const CHART_SIZE: (u32, u32) = (1000, 500);
