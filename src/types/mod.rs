pub mod condition;
pub mod daily_record;
pub mod location;
pub mod report;
pub mod series;
pub mod utils;
