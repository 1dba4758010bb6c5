// Login, registration and logout.

pub mod handlers;
