/// Terminal output for the inspector.

pub mod report;
