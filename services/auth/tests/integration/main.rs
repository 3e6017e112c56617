mod provision_test;
mod router_test;
