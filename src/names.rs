/// Every question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

// Play defaults
pub const DEFAULT_QUESTION_COUNT: usize = 5;

// Store
pub const DEFAULT_DATABASE_URL: &str = "sqlite://themequiz.db";

// Logging
pub const DEFAULT_LOG_FILTER: &str = "themequiz=info,sqlx=warn";
