pub mod time_utils;

pub use time_utils::{format_date_range, parse_ymd, Clock, FixedClock, SystemClock};
