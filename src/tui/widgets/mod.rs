// Dashboard widgets.

pub mod confirm;
pub mod help_bar;
pub mod history;
pub mod proposal;
pub mod status_bar;
pub mod year_banner;
