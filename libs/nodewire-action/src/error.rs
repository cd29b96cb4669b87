use nodewire_api::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("action '{0}' registered twice")]
    DuplicateAction(&'static str),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
