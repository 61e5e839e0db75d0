pub mod assignments;
pub mod drivers;
pub mod jobs;

pub use assignments::AssignmentService;
pub use drivers::DriverService;
pub use jobs::JobService;
