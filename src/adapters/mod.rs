// Adapters layer: converts external payload shapes into domain submissions.

pub mod form_intake;
