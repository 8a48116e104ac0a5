//! User and order book registries
//!
//! Both are plain owned objects; the engine holds one of each and hands out
//! references. Neither ever removes an entry.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::info;
use types::errors::EngineError;
use types::ids::{AssetSymbol, UserId};
use types::numeric::Price;

use crate::book::OrderBook;

/// A book behind its own lock; the unit of mutual exclusion per asset
pub type SharedBook = Arc<Mutex<OrderBook>>;

/// Maps user identity to an optional notification target
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: DashMap<UserId, Option<String>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user or overwrite its callback target
    ///
    /// Returns whether the user was already registered.
    pub fn register(&self, user: UserId, target: Option<String>) -> bool {
        let already_registered = self.users.insert(user.clone(), target.clone()).is_some();
        info!(
            user = %user,
            target = target.as_deref().unwrap_or("-"),
            already_registered,
            "User registered"
        );
        already_registered
    }

    /// Fail with `UnauthorizedUser` unless the user has registered
    pub fn require_registered(&self, user: &UserId) -> Result<(), EngineError> {
        if self.users.contains_key(user) {
            Ok(())
        } else {
            Err(EngineError::UnauthorizedUser { user: user.clone() })
        }
    }

    pub fn is_registered(&self, user: &UserId) -> bool {
        self.users.contains_key(user)
    }

    /// Current notification target of a user, if any
    pub fn target(&self, user: &UserId) -> Option<String> {
        self.users.get(user).and_then(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Process-wide mapping from asset symbol to its book
#[derive(Debug, Default)]
pub struct OrderBookRegistry {
    books: DashMap<AssetSymbol, SharedBook>,
}

impl OrderBookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book for a new asset
    ///
    /// Fails with `InvalidRange` for bad bounds and `DuplicateAsset` if the
    /// asset already has a book.
    pub fn create(&self, asset: AssetSymbol, min_price: Price, max_price: Price) -> Result<(), EngineError> {
        match self.books.entry(asset.clone()) {
            Entry::Occupied(_) => Err(EngineError::DuplicateAsset { asset }),
            Entry::Vacant(slot) => {
                let book = OrderBook::new(asset.clone(), min_price, max_price)?;
                slot.insert(Arc::new(Mutex::new(book)));
                info!(asset = %asset, min_price = %min_price, max_price = %max_price, "Order book created");
                Ok(())
            }
        }
    }

    /// Resolve the book for an asset
    pub fn lookup(&self, asset: &AssetSymbol) -> Result<SharedBook, EngineError> {
        self.books
            .get(asset)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::UnknownAsset { asset: asset.clone() })
    }

    pub fn contains(&self, asset: &AssetSymbol) -> bool {
        self.books.contains_key(asset)
    }

    /// Known assets, sorted
    pub fn symbols(&self) -> Vec<AssetSymbol> {
        let mut symbols: Vec<AssetSymbol> = self.books.iter().map(|entry| entry.key().clone()).collect();
        symbols.sort();
        symbols
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::errors::ValidationError;

    #[test]
    fn test_register_is_upsert() {
        let users = UserRegistry::new();
        let user = UserId::new("user1");

        assert!(!users.register(user.clone(), Some("http://localhost:18081/a".into())));
        assert!(users.register(user.clone(), Some("http://localhost:18081/b".into())));

        assert_eq!(users.target(&user).as_deref(), Some("http://localhost:18081/b"));
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_register_without_target() {
        let users = UserRegistry::new();
        let user = UserId::new("quiet");

        users.register(user.clone(), None);
        assert!(users.is_registered(&user));
        assert_eq!(users.target(&user), None);
    }

    #[test]
    fn test_require_registered() {
        let users = UserRegistry::new();
        users.register(UserId::new("user1"), None);

        assert!(users.require_registered(&UserId::new("user1")).is_ok());
        assert_eq!(
            users.require_registered(&UserId::new("ghost")),
            Err(EngineError::UnauthorizedUser { user: UserId::new("ghost") })
        );
    }

    #[test]
    fn test_create_and_lookup_book() {
        let books = OrderBookRegistry::new();
        books.create(AssetSymbol::new("BTC"), Price::new(100), Price::new(200)).unwrap();

        let book = books.lookup(&AssetSymbol::new("BTC")).unwrap();
        assert_eq!(book.lock().min_price(), Price::new(100));
        assert_eq!(book.lock().max_price(), Price::new(200));
    }

    #[test]
    fn test_create_duplicate_book_fails() {
        let books = OrderBookRegistry::new();
        let asset = AssetSymbol::new("BTC");
        books.create(asset.clone(), Price::new(100), Price::new(200)).unwrap();

        let result = books.create(asset.clone(), Price::new(0), Price::new(10));
        assert_eq!(result, Err(EngineError::DuplicateAsset { asset: asset.clone() }));
        assert_eq!(books.lookup(&asset).unwrap().lock().min_price(), Price::new(100));
    }

    #[test]
    fn test_create_invalid_range_fails() {
        let books = OrderBookRegistry::new();
        let result = books.create(AssetSymbol::new("ETH"), Price::new(50), Price::new(50));

        assert!(matches!(
            result,
            Err(EngineError::Validation(ValidationError::InvalidRange { .. }))
        ));
        assert!(!books.contains(&AssetSymbol::new("ETH")));
    }

    #[test]
    fn test_lookup_unknown_asset() {
        let books = OrderBookRegistry::new();
        assert!(matches!(
            books.lookup(&AssetSymbol::new("DOGE")),
            Err(EngineError::UnknownAsset { .. })
        ));
    }

    #[test]
    fn test_symbols_sorted() {
        let books = OrderBookRegistry::new();
        for symbol in ["SOL", "BTC", "ETH"] {
            books.create(AssetSymbol::new(symbol), Price::new(1), Price::new(10)).unwrap();
        }
        let symbols: Vec<String> = books.symbols().iter().map(|s| s.to_string()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH", "SOL"]);
    }
}
