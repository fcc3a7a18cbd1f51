use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/wa/products")]
    Products,
    #[at("/wa/cart")]
    Cart,
    #[at("/404")]
    #[not_found]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::Route;
    use storefront_core::constants::DEFAULT_PRODUCTS_PATH;
    use yew_router::Routable;

    #[test]
    fn products_route_matches_anchor_path() {
        assert_eq!(Route::Products.to_path(), DEFAULT_PRODUCTS_PATH);
        assert_eq!(Route::recognize("/wa/cart"), Some(Route::Cart));
        assert_eq!(Route::recognize("/elsewhere"), Some(Route::NotFound));
    }
}
