//! Shared entries and helpers for integration tests.

#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use app_registry::{AppContext, Crypto, Entry, EntryMap, RegFunc, RegistryError, RegistryResult};

pub const MOCK_ENTRY_TYPE: &str = "MockEntry";

/// Ordered record of lifecycle calls, shared between entries.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Entry that records its bootstrap and interrupt calls.
pub struct MockEntry {
    pub name: String,
    pub default: bool,
    pub log: CallLog,
}

impl MockEntry {
    pub fn new(name: &str, log: &CallLog) -> Arc<dyn Entry> {
        Arc::new(Self {
            name: name.to_string(),
            default: false,
            log: log.clone(),
        })
    }
}

impl fmt::Display for MockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"entryName\":\"{}\"}}", self.name)
    }
}

impl Entry for MockEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn entry_type(&self) -> &str {
        MOCK_ENTRY_TYPE
    }

    fn description(&self) -> &str {
        "mock entry"
    }

    fn bootstrap(&self, _ctx: &AppContext) {
        self.log.push(format!("bootstrap:{}", self.name));
    }

    fn interrupt(&self, _ctx: &AppContext) {
        self.log.push(format!("interrupt:{}", self.name));
    }

    fn is_default(&self) -> bool {
        self.default
    }
}

/// Registration function producing one `MockEntry` per name.
pub fn mock_reg_func(names: &'static [&'static str], log: &CallLog) -> RegFunc {
    let log = log.clone();
    RegFunc::new(move |_raw| {
        Ok(names
            .iter()
            .map(|name| (name.to_string(), MockEntry::new(name, &log)))
            .collect::<EntryMap>())
    })
}

/// Crypto entry XOR-ing payloads with a single-byte key.
pub struct XorCrypto {
    pub name: String,
    pub key: u8,
}

impl XorCrypto {
    pub fn new(name: &str, key: u8) -> Arc<dyn Entry> {
        Arc::new(Self {
            name: name.to_string(),
            key,
        })
    }
}

impl fmt::Display for XorCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"entryName\":\"{}\",\"algorithm\":\"XOR\"}}", self.name)
    }
}

impl Entry for XorCrypto {
    fn name(&self) -> &str {
        &self.name
    }

    fn entry_type(&self) -> &str {
        app_registry::entry::CRYPTO_ENTRY_TYPE
    }

    fn description(&self) -> &str {
        "xor crypto"
    }

    fn bootstrap(&self, _ctx: &AppContext) {}

    fn interrupt(&self, _ctx: &AppContext) {}

    fn as_crypto(self: Arc<Self>) -> Option<Arc<dyn Crypto>> {
        Some(self)
    }
}

impl Crypto for XorCrypto {
    fn algorithm(&self) -> &str {
        "XOR"
    }

    fn encrypt(&self, plain: &[u8]) -> RegistryResult<Vec<u8>> {
        if plain.is_empty() {
            return Err(RegistryError::Crypto("empty payload".into()));
        }
        Ok(plain.iter().map(|b| b ^ self.key).collect())
    }

    fn decrypt(&self, cipher: &[u8]) -> RegistryResult<Vec<u8>> {
        self.encrypt(cipher)
    }
}
