pub mod dashboard;
mod state;

#[cfg(test)]
mod dashboard_smoke;

pub use dashboard::DashboardView;
pub use state::ViewError;
