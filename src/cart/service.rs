use std::collections::HashMap;
use uuid::Uuid;

use crate::cart::error::CartError;
use crate::cart::models::{CartItem, CartItemView};
use crate::cart::repository::CartRepository;
use crate::catalog::repository::ProductsRepository;

/// Service for cart business logic
///
/// Every quantity change is checked against the live product row. The check
/// is best-effort: no lock spans check and commit, so concurrent requests can
/// exceed stock transiently. The order lifecycle enforces the hard limit.
#[derive(Clone)]
pub struct CartService {
    cart_repo: CartRepository,
    products_repo: ProductsRepository,
}

impl CartService {
    pub fn new(cart_repo: CartRepository, products_repo: ProductsRepository) -> Self {
        Self {
            cart_repo,
            products_repo,
        }
    }

    /// List a user's cart with product snapshots joined in
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<CartItemView>, CartError> {
        let items = self.cart_repo.find_by_user(user_id).await?;
        if items.is_empty() {
            return Ok(vec![]);
        }

        let product_ids: Vec<String> = items.iter().map(|i| i.product_id.clone()).collect();
        let products = self
            .products_repo
            .find_by_ids(&product_ids)
            .await
            .map_err(|e| CartError::DatabaseError(e.to_string()))?;

        let mut by_id: HashMap<String, _> = products
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| {
                let product = by_id.remove(&item.product_id);
                CartItemView {
                    id: item.id,
                    user_id: item.user_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    note: item.note,
                    product,
                    created_at: item.created_at,
                    updated_at: item.updated_at,
                }
            })
            .collect())
    }

    /// Add a product to the cart, merging with an existing row for the same
    /// product. The combined quantity must not exceed current stock.
    pub async fn add_item(
        &self,
        user_id: Uuid,
        product_id: &str,
        quantity: i32,
    ) -> Result<CartItem, CartError> {
        if quantity < 1 {
            return Err(CartError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = self
            .products_repo
            .find_by_id(product_id)
            .await
            .map_err(|e| CartError::DatabaseError(e.to_string()))?
            .ok_or(CartError::ProductNotFound)?;

        match self
            .cart_repo
            .find_by_user_and_product(user_id, product_id)
            .await?
        {
            Some(existing) => {
                let new_quantity = existing.quantity + quantity;
                if product.stock < new_quantity {
                    return Err(CartError::InsufficientStock);
                }
                self.cart_repo.update_quantity(existing.id, new_quantity).await
            }
            None => {
                if product.stock < quantity {
                    return Err(CartError::InsufficientStock);
                }
                self.cart_repo.insert(user_id, product_id, quantity).await
            }
        }
    }

    /// Change the quantity of a cart row, stock-checked
    pub async fn update_quantity(&self, cart_id: Uuid, quantity: i32) -> Result<CartItem, CartError> {
        if quantity < 1 {
            return Err(CartError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let item = self
            .cart_repo
            .find_by_id(cart_id)
            .await?
            .ok_or(CartError::NotFound)?;

        let product = self
            .products_repo
            .find_by_id(&item.product_id)
            .await
            .map_err(|e| CartError::DatabaseError(e.to_string()))?
            .ok_or(CartError::ProductNotFound)?;

        if product.stock < quantity {
            return Err(CartError::InsufficientStock);
        }

        self.cart_repo.update_quantity(cart_id, quantity).await
    }

    /// Set or clear the free-text note; whitespace-only notes are cleared
    pub async fn update_note(&self, cart_id: Uuid, note: Option<&str>) -> Result<(), CartError> {
        let trimmed = note.map(str::trim).filter(|n| !n.is_empty());
        self.cart_repo.update_note(cart_id, trimmed).await
    }

    pub async fn remove_item(&self, cart_id: Uuid) -> Result<(), CartError> {
        if !self.cart_repo.delete(cart_id).await? {
            return Err(CartError::NotFound);
        }
        Ok(())
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<u64, CartError> {
        self.cart_repo.clear(user_id).await
    }
}
