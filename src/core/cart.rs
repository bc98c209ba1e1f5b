use crate::models::{Product, User};

/// Read side of the auth collaborator
pub trait Session {
    fn current_user(&self) -> Option<User>;
}

/// Write side of the cart collaborator
pub trait Cart {
    fn add_item(&mut self, product: &Product);
}

/// What happened to an add-to-cart request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    Added,
    /// No signed-in user; the add was dropped and the login prompt raised
    LoginRequired,
}

/// Gates cart additions on a signed-in user
///
/// Unauthenticated adds are dropped, not queued for after login.
#[derive(Debug)]
pub struct CartGate<A, C> {
    session: A,
    cart: C,
    login_prompt: bool,
}

impl<A: Session, C: Cart> CartGate<A, C> {
    pub fn new(session: A, cart: C) -> Self {
        Self {
            session,
            cart,
            login_prompt: false,
        }
    }

    pub fn add_item(&mut self, product: &Product) -> CartOutcome {
        match self.session.current_user() {
            Some(user) => {
                self.cart.add_item(product);
                tracing::debug!(user = %user.uid, product_id = product.id, "Added product to cart");
                CartOutcome::Added
            }
            None => {
                self.login_prompt = true;
                tracing::info!(product_id = product.id, "Add to cart without a session, prompting login");
                CartOutcome::LoginRequired
            }
        }
    }

    pub fn login_prompt(&self) -> bool {
        self.login_prompt
    }

    pub fn dismiss_login_prompt(&mut self) {
        self.login_prompt = false;
    }

    pub fn session(&self) -> &A {
        &self.session
    }

    pub fn cart(&self) -> &C {
        &self.cart
    }
}

/// Fixed session, for hosts that resolve the user up front
impl Session for Option<User> {
    fn current_user(&self) -> Option<User> {
        self.clone()
    }
}

/// Plain in-memory cart
impl Cart for Vec<Product> {
    fn add_item(&mut self, product: &Product) {
        self.push(product.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Catalog;

    fn shopper() -> User {
        User {
            uid: "u1".to_string(),
            email: Some("shopper@pexinxa.com.br".to_string()),
            display_name: None,
        }
    }

    #[test]
    fn test_signed_in_user_adds() {
        let catalog = Catalog::builtin();
        let mut gate = CartGate::new(Some(shopper()), Vec::new());

        assert_eq!(gate.add_item(&catalog.products()[0]), CartOutcome::Added);
        assert_eq!(gate.cart().len(), 1);
        assert!(!gate.login_prompt());
    }

    #[test]
    fn test_anonymous_add_raises_prompt() {
        let catalog = Catalog::builtin();
        let mut gate = CartGate::new(None::<User>, Vec::new());

        assert_eq!(gate.add_item(&catalog.products()[0]), CartOutcome::LoginRequired);
        assert!(gate.cart().is_empty());
        assert!(gate.login_prompt());

        gate.dismiss_login_prompt();
        assert!(!gate.login_prompt());
    }
}
