//! Cart manager: stock-checked mutations over a persisted cart.

use std::sync::Arc;
use std::time::Instant;

use cart_store::{KeyValueStore, KeyValueStoreExt, StoreError};
use catalog::{CatalogError, CatalogService};
use common::ProductId;
use tokio::sync::{Mutex, watch};

use crate::error::CartError;
use crate::notice::{Notifier, TracingNotifier};

use super::{Cart, CartItem, CartOperation, UpdateProductAmount};

/// Storage key the cart blob is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Owns the cart for one session.
///
/// Every operation takes the single writer lock for its whole
/// read-check-commit cycle, so overlapping calls are applied one after the
/// other and never overwrite each other's result. A commit writes the store
/// first and only then replaces the in-memory cart; if the write fails the
/// cart is left as it was.
///
/// Failed operations return the error and also push the matching
/// [`Notice`](crate::Notice) to the configured notifier.
pub struct CartManager<S: KeyValueStore, C: CatalogService> {
    store: S,
    catalog: C,
    storage_key: String,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<Cart>,
    writer: Mutex<()>,
}

impl<S: KeyValueStore, C: CatalogService> CartManager<S, C> {
    /// Loads the cart persisted under [`DEFAULT_STORAGE_KEY`].
    pub async fn load(store: S, catalog: C) -> Result<Self, CartError> {
        Self::load_with_key(store, catalog, DEFAULT_STORAGE_KEY).await
    }

    /// Loads the cart persisted under `storage_key`.
    ///
    /// A missing value starts an empty cart. So does a value that cannot be
    /// parsed; it is logged and overwritten by the next commit. Only a
    /// failure to reach the store is returned as an error.
    #[tracing::instrument(skip_all, fields(storage_key = tracing::field::Empty))]
    pub async fn load_with_key(
        store: S,
        catalog: C,
        storage_key: impl Into<String>,
    ) -> Result<Self, CartError> {
        let storage_key = storage_key.into();
        tracing::Span::current().record("storage_key", storage_key.as_str());

        let cart = read_persisted(&store, &storage_key).await?;
        tracing::info!(items = cart.len(), "cart loaded");

        let (state, _) = watch::channel(cart);
        Ok(Self {
            store,
            catalog,
            storage_key,
            notifier: Arc::new(TracingNotifier),
            state,
            writer: Mutex::new(()),
        })
    }

    /// Replaces the notifier failed operations report to.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Returns the key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the underlying catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns a snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Subscribes to cart changes.
    ///
    /// The receiver is marked changed after every successful commit.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Adds one unit of a product.
    ///
    /// A product already in the cart is incremented if the stock allows it;
    /// otherwise its catalog record is fetched and appended with amount 1.
    #[tracing::instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let started = Instant::now();
        let _writer = self.writer.lock().await;
        let result = self.try_add_product(product_id).await;
        self.finish(CartOperation::AddProduct, started, result)
    }

    /// Removes a product from the cart.
    ///
    /// Does not consult the catalog.
    #[tracing::instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let started = Instant::now();
        let _writer = self.writer.lock().await;
        let result = self.try_remove_product(product_id).await;
        self.finish(CartOperation::RemoveProduct, started, result)
    }

    /// Sets the amount of a product already in the cart.
    ///
    /// The amount must lie in `1..=stock`; it is stored as given.
    #[tracing::instrument(skip(self))]
    pub async fn update_product_amount(
        &self,
        cmd: UpdateProductAmount,
    ) -> Result<Cart, CartError> {
        let started = Instant::now();
        let _writer = self.writer.lock().await;
        let result = self.try_update_product_amount(cmd).await;
        self.finish(CartOperation::UpdateProductAmount, started, result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let current = self.cart();

        let next = match current.get(product_id) {
            Some(existing) => {
                let stock = self.catalog.stock(product_id).await?;
                let requested = i64::from(existing.amount) + 1;
                if !stock.allows(requested) {
                    return Err(CartError::OutOfStock {
                        product_id,
                        requested,
                        available: stock.amount,
                    });
                }
                current
                    .with_amount(product_id, existing.amount + 1)
                    .ok_or(CartError::NotInCart { product_id })?
            }
            None => {
                let product = self.catalog.product(product_id).await?;
                if product.id != product_id {
                    return Err(CatalogError::MismatchedRecord {
                        resource: "products",
                        requested: product_id,
                        returned: product.id,
                    }
                    .into());
                }
                current
                    .with_appended(CartItem::from_product(product))
                    .ok_or(CartError::NotInCart { product_id })?
            }
        };

        self.commit(next).await
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let next = self
            .cart()
            .without(product_id)
            .ok_or(CartError::NotInCart { product_id })?;

        self.commit(next).await
    }

    async fn try_update_product_amount(
        &self,
        cmd: UpdateProductAmount,
    ) -> Result<Cart, CartError> {
        let UpdateProductAmount { product_id, amount } = cmd;

        let stock = self.catalog.stock(product_id).await?;
        let out_of_stock = CartError::OutOfStock {
            product_id,
            requested: amount,
            available: stock.amount,
        };
        if !stock.allows(amount) {
            return Err(out_of_stock);
        }
        let amount = u32::try_from(amount).map_err(|_| out_of_stock)?;

        let next = self
            .cart()
            .with_amount(product_id, amount)
            .ok_or(CartError::NotInCart { product_id })?;

        self.commit(next).await
    }

    /// Persists `next` and then publishes it as the current cart.
    async fn commit(&self, next: Cart) -> Result<Cart, CartError> {
        self.store.set_json(&self.storage_key, &next).await?;
        self.state.send_replace(next.clone());

        metrics::counter!("cart_commits_total").increment(1);
        metrics::gauge!("cart_items").set(next.len() as f64);
        tracing::debug!(
            items = next.len(),
            quantity = next.total_quantity(),
            "cart committed"
        );
        Ok(next)
    }

    fn finish(
        &self,
        operation: CartOperation,
        started: Instant,
        result: Result<Cart, CartError>,
    ) -> Result<Cart, CartError> {
        let outcome = match &result {
            Ok(_) => "success",
            Err(err) => err.kind().as_str(),
        };
        metrics::counter!(
            "cart_operations_total",
            "operation" => operation.as_str(),
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!("cart_operation_duration_seconds", "operation" => operation.as_str())
            .record(started.elapsed().as_secs_f64());

        if let Err(err) = &result {
            tracing::warn!(%operation, error = %err, "cart operation failed");
            self.notifier.notify(err.notice(operation));
        }
        result
    }
}

async fn read_persisted<S: KeyValueStore>(store: &S, key: &str) -> Result<Cart, CartError> {
    let persisted: Result<Option<Vec<CartItem>>, StoreError> = store.get_json(key).await;
    match persisted {
        Ok(Some(items)) => {
            let stored = items.len();
            let cart = Cart::from_items(items);
            let dropped = stored - cart.len();
            if dropped > 0 {
                tracing::warn!(dropped, "dropped invalid items from persisted cart");
            }
            Ok(cart)
        }
        Ok(None) => Ok(Cart::new()),
        Err(StoreError::Serialization(e)) => {
            tracing::warn!(error = %e, "persisted cart is malformed, starting empty");
            Ok(Cart::new())
        }
        Err(e) => Err(e.into()),
    }
}
