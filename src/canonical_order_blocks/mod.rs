pub(crate) mod bookkeeping;
pub mod quadrangles;
