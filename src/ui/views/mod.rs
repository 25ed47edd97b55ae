mod assignees;
mod board;
mod issue_detail;
mod projects;
mod teams;
mod timeline;
mod users;

pub use assignees::AssigneesView;
pub use board::BoardView;
pub use issue_detail::IssueDetailView;
pub use projects::ProjectsView;
pub use teams::TeamSummaryView;
pub use timeline::TimelineView;
pub use users::UserSummaryView;
