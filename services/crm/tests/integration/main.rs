
mod dashboard_test;
mod lead_test;
mod opportunity_test;
mod router_test;
mod user_test;
