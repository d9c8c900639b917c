use std::fmt;

use futures::future::BoxFuture;
use futures::FutureExt as _;

use super::*;

/// Whatever a configuration source can hand back before it is resolved.
pub enum RawConfigExport {
    /// A concrete configuration value.
    Value(Value),
    /// An in-flight asynchronous result.
    Pending(BoxFuture<'static, Result<Value>>),
    /// A deferred computation, invoked once during resolution.
    Producer(Box<dyn FnOnce() -> Result<RawConfigExport> + Send>),
}

impl RawConfigExport {
    pub fn empty() -> Self {
        Self::Value(Value::Mapping(Mapping::new()))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Result<Value>> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }

    pub fn producer<F>(producer: F) -> Self
    where
        F: FnOnce() -> Result<RawConfigExport> + Send + 'static,
    {
        Self::Producer(Box::new(producer))
    }

    /// Run producers and await futures until a concrete configuration mapping is left.
    ///
    /// `null` (e.g. an empty file) is an empty configuration.
    pub async fn resolve(self) -> Result<Mapping> {
        let mut raw = self;
        let value = loop {
            raw = match raw {
                Self::Value(value) => break value,
                Self::Pending(future) => break future.await?,
                Self::Producer(producer) => producer()?,
            };
        };

        match value {
            Value::Mapping(mapping) => Ok(mapping),
            Value::Null => Ok(Mapping::new()),
            other => Err(Status::new("Configuration must be a mapping")
                .context_with(|c| c.insert("Found", kind_of(&other)))),
        }
    }
}

impl From<Value> for RawConfigExport {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Mapping> for RawConfigExport {
    fn from(mapping: Mapping) -> Self {
        Self::Value(Value::Mapping(mapping))
    }
}

impl fmt::Debug for RawConfigExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod test {
    use futures::executor::block_on;

    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn resolve_value() {
        let raw = RawConfigExport::from(mapping("title: A"));
        let actual = block_on(raw.resolve()).unwrap();
        assert_eq!(actual, mapping("title: A"));
    }

    #[test]
    fn resolve_pending() {
        let raw = RawConfigExport::pending(async { Ok(Value::Mapping(mapping("title: A"))) });
        let actual = block_on(raw.resolve()).unwrap();
        assert_eq!(actual, mapping("title: A"));
    }

    #[test]
    fn resolve_producer_of_pending() {
        let raw = RawConfigExport::producer(|| {
            Ok(RawConfigExport::pending(async {
                Ok(Value::Mapping(mapping("title: A")))
            }))
        });
        let actual = block_on(raw.resolve()).unwrap();
        assert_eq!(actual, mapping("title: A"));
    }

    #[test]
    fn resolve_null_is_empty() {
        let raw = RawConfigExport::from(Value::Null);
        let actual = block_on(raw.resolve()).unwrap();
        assert!(actual.is_empty());
    }

    #[test]
    fn resolve_scalar_fails() {
        let raw = RawConfigExport::from(Value::from("title"));
        assert!(block_on(raw.resolve()).is_err());
    }

    #[test]
    fn resolve_propagates_failures() {
        let raw = RawConfigExport::producer(|| Err(Status::new("boom")));
        assert!(block_on(raw.resolve()).is_err());

        let raw = RawConfigExport::pending(async { Err(Status::new("boom")) });
        assert!(block_on(raw.resolve()).is_err());
    }
}
