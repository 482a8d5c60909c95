//! Authentication credentials

/// Credentials used to authenticate against the object storage service.
///
/// Supplied once when a client is constructed. The password never appears
/// in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Identity endpoint URL
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub tenant_id: String,
    /// Domain name (some providers use the tenant name here)
    pub domain_name: String,
}

impl Credentials {
    pub fn new(
        auth_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            auth_url: auth_url.into(),
            username: username.into(),
            password: password.into(),
            tenant_id: String::new(),
            domain_name: String::new(),
        }
    }

    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = tenant_id.into();
        self
    }

    pub fn with_domain_name(mut self, domain_name: impl Into<String>) -> Self {
        self.domain_name = domain_name.into();
        self
    }

    /// Tenant identifier, or `None` when unset
    pub fn tenant(&self) -> Option<&str> {
        if self.tenant_id.is_empty() {
            None
        } else {
            Some(&self.tenant_id)
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("tenant_id", &self.tenant_id)
            .field("domain_name", &self.domain_name)
            .finish()
    }
}
