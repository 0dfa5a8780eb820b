pub mod prelude;

pub mod preferences;
