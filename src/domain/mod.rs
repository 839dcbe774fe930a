pub mod todo;

#[cfg(test)]
pub(crate) mod test_util;
