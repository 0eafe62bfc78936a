#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Clients,
    Groups,
    AddClient,
    EditClient,
    DeleteClient,
    AddGroup,
    EditGroup,
    DeleteGroup,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Groups => "groups",
            Self::AddClient => "add_client",
            Self::EditClient => "edit_client",
            Self::DeleteClient => "delete_client",
            Self::AddGroup => "add_group",
            Self::EditGroup => "edit_group",
            Self::DeleteGroup => "delete_group",
        }
    }

    pub fn url(self, api_base: &str) -> String {
        format!("{}/{}", api_base.trim_end_matches('/'), self.path())
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.path())
    }
}
