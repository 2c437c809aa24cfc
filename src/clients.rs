pub(crate) mod jma;

pub(crate) use jma::{JmaClient, JmaClientConfig};
