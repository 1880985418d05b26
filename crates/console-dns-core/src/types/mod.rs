mod kind;
mod record;
mod zone;

pub use kind::*;
pub use record::*;
pub use zone::*;
