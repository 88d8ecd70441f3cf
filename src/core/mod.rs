// Form validation and domain-layer modules
pub mod br_validators {
    pub use crate::br_validators::*;
}

pub mod form_schemas {
    pub use crate::form_schemas::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod validation {
    pub use crate::validation::*;
}

pub mod errors {
    pub use crate::errors::*;
}
