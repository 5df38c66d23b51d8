
pub(crate) use context::TestContext;
