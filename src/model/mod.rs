pub mod calendar;
pub mod fixture;
pub mod forecast;
pub mod intent;
pub mod location;
