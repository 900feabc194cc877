// Profile Store: the single source of truth for the user-entered profile and
// the job description input. No persistence; state lives for the process.

pub mod handlers;
pub mod store;
