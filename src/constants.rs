/// Color applied to timers created without an explicit color (a green shade)
pub const DEFAULT_TIMER_COLOR: &str = "#0cd413";

/// Alarm sound used when no sound row in the registry is flagged as default
pub const FALLBACK_ALARM_SOUND: &str = "alarm.mp3";

/// Event type recorded when a sequence playback begins
pub const SEQUENCE_START_EVENT: &str = "sequence_start";

/// Number of random bytes in a sequence identifier
/// (base64url without padding encodes 8 bytes to 11 characters)
pub const SEQUENCE_ID_BYTES: usize = 8;

/// Maximum number of rows in the most-used sequences view
pub const MOST_USED_LIMIT: u64 = 35;

/// Timezone used when presenting log timestamps to a viewer
pub const DEFAULT_DISPLAY_TIMEZONE: &str = "America/Chicago";
