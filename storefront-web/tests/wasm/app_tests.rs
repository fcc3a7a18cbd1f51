use wasm_bindgen_test::*;
use yew::Renderer;

use storefront_web::app::App;
use storefront_web::dom;

fn ensure_app_root() -> web_sys::Element {
    let doc = dom::document();
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create app root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append app root");
    root
}

#[wasm_bindgen_test]
fn app_mounts_products_screen() {
    Renderer::<App>::with_root(ensure_app_root()).render();
    let doc = dom::document();
    let screen = doc
        .get_element_by_id("prods-screen")
        .expect("products screen rendered");
    assert_eq!(screen.tag_name(), "MAIN");
    assert!(
        doc.get_elements_by_class_name("prod-card").length() > 0,
        "first category should render product cards"
    );
}
