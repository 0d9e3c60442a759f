pub mod interactive;
pub mod lookup;
pub mod refresh;
pub mod search;
