use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Failure to parse the platform's `VCAP_SERVICES` document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("VCAP_SERVICES is not set")]
    Missing,
    #[error("VCAP_SERVICES is not valid JSON: {0}")]
    Invalid(String),
}

/// Credential lookup failure for a single probe invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("service catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),
    #[error("no service binding named {0:?}")]
    NotFound(String),
    #[error("malformed binding {name:?}: {reason}")]
    Malformed { name: String, reason: String },
}

/// One bound service instance as listed in `VCAP_SERVICES`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInstance {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub credentials: Value,
}

/// Parsed `VCAP_SERVICES`: service label → bound instances.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ServiceCatalog {
    services: BTreeMap<String, Vec<ServiceInstance>>,
}

impl ServiceCatalog {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(raw).map_err(|e| CatalogError::Invalid(e.to_string()))
    }

    /// Find an instance by its binding name, across all labels.
    pub fn find(&self, name: &str) -> Option<&ServiceInstance> {
        self.services
            .values()
            .flatten()
            .find(|instance| instance.name == name)
    }

    /// Number of bound instances across all labels.
    pub fn instance_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }
}

/// Connection credentials for one probe invocation.
///
/// Absent credential fields are empty rather than errors; each backend
/// decides which of them it needs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ServiceBinding {
    pub name: String,
    pub label: String,
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub database: String,
    pub uri: String,
    pub ssl: bool,
}

impl fmt::Debug for ServiceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("ServiceBinding")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &password)
            .field("database", &self.database)
            .field("uri", &self.uri)
            .field("ssl", &self.ssl)
            .finish()
    }
}

/// Resolves logical service names against the catalog loaded at start-up.
///
/// An unreadable catalog is kept as an error so that every probe request
/// reports it, instead of the process refusing to start.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    catalog: Result<ServiceCatalog, CatalogError>,
}

impl CredentialResolver {
    pub fn new(catalog: Result<ServiceCatalog, CatalogError>) -> Self {
        Self { catalog }
    }

    /// Build from the raw `VCAP_SERVICES` value, if the variable was set.
    pub fn from_vcap(raw: Option<&str>) -> Self {
        let catalog = match raw {
            Some(raw) => ServiceCatalog::from_json(raw),
            None => Err(CatalogError::Missing),
        };
        Self::new(catalog)
    }

    pub fn catalog(&self) -> Result<&ServiceCatalog, &CatalogError> {
        self.catalog.as_ref()
    }

    pub fn resolve(&self, service_name: &str) -> Result<ServiceBinding, BindingError> {
        let catalog = self.catalog.as_ref().map_err(|e| e.clone())?;
        let instance = catalog
            .find(service_name)
            .ok_or_else(|| BindingError::NotFound(service_name.to_owned()))?;

        let malformed = |reason: String| BindingError::Malformed {
            name: instance.name.clone(),
            reason,
        };
        let empty = Map::new();
        let creds = match &instance.credentials {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => return Err(malformed(format!("credentials is {}", json_type(other)))),
        };

        Ok(ServiceBinding {
            name: instance.name.clone(),
            label: instance.label.clone(),
            host: string_field(creds, &["host", "hostname"]),
            port: port_field(creds).map_err(malformed)?,
            username: string_field(creds, &["username", "user"]),
            password: string_field(creds, &["password"]),
            database: string_field(creds, &["db_name", "name", "database"]),
            uri: string_field(creds, &["uri", "url"]),
            ssl: ssl_field(creds).map_err(malformed)?,
        })
    }
}

fn string_field(creds: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| creds.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_owned()
}

fn port_field(creds: &Map<String, Value>) -> Result<Option<u16>, String> {
    let port = match creds.get("port") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    match port.and_then(|p| u16::try_from(p).ok()).filter(|p| *p != 0) {
        Some(p) => Ok(Some(p)),
        None => Err(format!("invalid port {}", creds["port"])),
    }
}

fn ssl_field(creds: &Map<String, Value>) -> Result<bool, String> {
    match creds.get("ssl") {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        Some(other) => Err(format!("invalid ssl flag {other}")),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
