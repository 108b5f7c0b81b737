pub mod applications;
pub mod project_skills;
pub mod projects;
pub mod ratings;
pub mod skills;
pub mod teams;
pub mod user_skills;
pub mod users;
