mod deploy;

pub(crate) use deploy::{DeployFormatter, PlainTextDeployFormatter};
