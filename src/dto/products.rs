use crate::domain::product::Product;

pub struct ProductsPageData {
    pub products: Vec<Product>,
}
