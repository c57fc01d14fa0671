// Scenario tests
// Genesis load, governance updates across heights, and cross-node determinism
