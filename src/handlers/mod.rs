mod forwarded;
mod health;

pub use forwarded::forwarded_for;
pub use health::health_check;
