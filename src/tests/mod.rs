pub mod test_envs;
pub mod test_tabular;
