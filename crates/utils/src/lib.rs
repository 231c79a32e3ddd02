mod logger;

pub use logger::LoggerManager;
