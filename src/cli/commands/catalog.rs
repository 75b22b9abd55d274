use super::{compose_body, id_arg, paging, split_ids};
use crate::api::resources::catalog::{
    CollectionInput, CollectionListOptions, Collections, MetafieldListOptions, Metafields,
    ProductInput, ProductListOptions, Products, StorefrontProductListOptions, StorefrontProducts,
    Taxonomies,
};
use crate::cli::dispatcher::CommandContext;
use crate::cli::main_types::{BodyArgs, PageArgs};
use crate::core::guard::Guard;
use crate::display::{Column, Outcome, col};
use crate::error::{ResultExt, ValidationError};
use clap::Subcommand;

const PRODUCT_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Title", "title"),
    col("Status", "status"),
    col("Vendor", "vendor"),
    col("Type", "product_type"),
    col("Updated", "updated_at"),
];

const COLLECTION_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Title", "title"),
    col("Handle", "handle"),
    col("Products", "products_count"),
    col("Updated", "updated_at"),
];

const STOREFRONT_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Title", "title"),
    col("Handle", "handle"),
    col("Price", "price"),
    col("Available", "available"),
];

const TAXONOMY_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Name", "name"),
    col("Parent", "parent_id"),
    col("Level", "level"),
];

const METAFIELD_COLUMNS: &[Column] = &[
    col("ID", "id"),
    col("Namespace", "namespace"),
    col("Key", "key"),
    col("Type", "type"),
    col("Value", "value"),
    col("Owner", "owner_resource"),
];

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List products
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by status (active, draft, archived)
        #[arg(long)]
        status: Option<String>,
        /// Filter by vendor
        #[arg(long)]
        vendor: Option<String>,
        /// Filter by product type
        #[arg(long)]
        product_type: Option<String>,
        /// Free-text search
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show one product
    Get { id: String },
    /// Create a product from flags and/or a JSON body
    #[command(after_help = "Examples:
  spl products create --title 'Canvas Tote' --vendor Acme --tags bags,summer
  spl products create --body-file product.json")]
    Create {
        #[command(flatten)]
        fields: ProductFields,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Update a product
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProductFields {
    /// Product title
    #[arg(long)]
    pub title: Option<String>,
    /// Product description (HTML allowed)
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub vendor: Option<String>,
    #[arg(long)]
    pub product_type: Option<String>,
    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// active, draft or archived
    #[arg(long)]
    pub status: Option<String>,
}

impl From<ProductFields> for ProductInput {
    fn from(fields: ProductFields) -> Self {
        ProductInput {
            title: fields.title,
            description: fields.description,
            vendor: fields.vendor,
            product_type: fields.product_type,
            tags: split_ids(&fields.tags),
            status: fields.status,
        }
    }
}

#[derive(Default)]
pub struct ProductHandler;

impl ProductHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: ProductCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            ProductCommands::List {
                page,
                status,
                vendor,
                product_type,
                keyword,
            } => {
                let (page, page_size) = paging(&page)?;
                let options = ProductListOptions {
                    page,
                    page_size,
                    status,
                    vendor,
                    product_type,
                    keyword,
                };
                let client = ctx.client()?;
                let payload = Products::new(client.as_ref())
                    .list(&options)
                    .await
                    .context("failed to list products")?;
                Ok(Outcome::list("products", PRODUCT_COLUMNS, payload))
            }
            ProductCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = Products::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get product")?;
                Ok(Outcome::record(&[], payload))
            }
            ProductCommands::Create { fields, body } => {
                let body = compose_body(&body, &ProductInput::from(fields))?;
                if let Some(stop) = ctx.preflight(&Guard::new("create product"))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Products::new(client.as_ref())
                    .create(body)
                    .await
                    .context("failed to create product")?;
                Ok(Outcome::record(&[], payload))
            }
            ProductCommands::Update { id, fields, body } => {
                let id = id_arg("id", &id)?;
                let body = compose_body(&body, &ProductInput::from(fields))?;
                if let Some(stop) = ctx.preflight(&Guard::new(format!("update product {}", id)))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Products::new(client.as_ref())
                    .update(&id, body)
                    .await
                    .context("failed to update product")?;
                Ok(Outcome::record(&[], payload))
            }
            ProductCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete product {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                Products::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete product")?;
                Ok(Outcome::message(format!("Deleted product {}.", id)))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CollectionCommands {
    /// List collections
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by title
        #[arg(long)]
        title: Option<String>,
        /// Filter by handle
        #[arg(long)]
        handle: Option<String>,
    },
    /// Show one collection
    Get { id: String },
    /// Create a collection
    Create {
        #[command(flatten)]
        fields: CollectionFields,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Update a collection
    Update {
        id: String,
        #[command(flatten)]
        fields: CollectionFields,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a collection
    Delete { id: String },
    /// Add products to a collection
    AddProducts {
        id: String,
        /// Product ids, comma separated or repeated
        #[arg(long = "product-ids", required = true)]
        product_ids: Vec<String>,
    },
    /// Remove one product from a collection
    RemoveProduct {
        id: String,
        /// Product id to remove
        #[arg(long)]
        product_id: String,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct CollectionFields {
    #[arg(long)]
    pub title: Option<String>,
    /// URL handle
    #[arg(long)]
    pub handle: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// e.g. manual, best-selling, price-asc
    #[arg(long)]
    pub sort_order: Option<String>,
}

impl From<CollectionFields> for CollectionInput {
    fn from(fields: CollectionFields) -> Self {
        CollectionInput {
            title: fields.title,
            handle: fields.handle,
            description: fields.description,
            sort_order: fields.sort_order,
        }
    }
}

#[derive(Default)]
pub struct CollectionHandler;

impl CollectionHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CollectionCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            CollectionCommands::List {
                page,
                title,
                handle,
            } => {
                let (page, page_size) = paging(&page)?;
                let options = CollectionListOptions {
                    page,
                    page_size,
                    title,
                    handle,
                };
                let client = ctx.client()?;
                let payload = Collections::new(client.as_ref())
                    .list(&options)
                    .await
                    .context("failed to list collections")?;
                Ok(Outcome::list("collections", COLLECTION_COLUMNS, payload))
            }
            CollectionCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = Collections::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get collection")?;
                Ok(Outcome::record(&[], payload))
            }
            CollectionCommands::Create { fields, body } => {
                let body = compose_body(&body, &CollectionInput::from(fields))?;
                if let Some(stop) = ctx.preflight(&Guard::new("create collection"))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Collections::new(client.as_ref())
                    .create(body)
                    .await
                    .context("failed to create collection")?;
                Ok(Outcome::record(&[], payload))
            }
            CollectionCommands::Update { id, fields, body } => {
                let id = id_arg("id", &id)?;
                let body = compose_body(&body, &CollectionInput::from(fields))?;
                let guard = Guard::new(format!("update collection {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Collections::new(client.as_ref())
                    .update(&id, body)
                    .await
                    .context("failed to update collection")?;
                Ok(Outcome::record(&[], payload))
            }
            CollectionCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete collection {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                Collections::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete collection")?;
                Ok(Outcome::message(format!("Deleted collection {}.", id)))
            }
            CollectionCommands::AddProducts { id, product_ids } => {
                let id = id_arg("id", &id)?;
                let product_ids = split_ids(&product_ids);
                if product_ids.is_empty() {
                    return Err(ValidationError::MissingFlag {
                        flag: "product-ids".to_string(),
                    }
                    .into());
                }
                let guard = Guard::new(format!(
                    "add {} product(s) to collection {}",
                    product_ids.len(),
                    id
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Collections::new(client.as_ref())
                    .add_products(&id, &product_ids)
                    .await
                    .context("failed to add products to collection")?;
                Ok(Outcome::message_with(
                    format!("Added {} product(s) to collection {}.", product_ids.len(), id),
                    payload,
                ))
            }
            CollectionCommands::RemoveProduct { id, product_id } => {
                let id = id_arg("id", &id)?;
                let product_id = id_arg("product-id", &product_id)?;
                let guard = Guard::destructive(format!(
                    "remove product {} from collection {}",
                    product_id, id
                ));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                Collections::new(client.as_ref())
                    .remove_product(&id, &product_id)
                    .await
                    .context("failed to remove product from collection")?;
                Ok(Outcome::message(format!(
                    "Removed product {} from collection {}.",
                    product_id, id
                )))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum StorefrontProductCommands {
    /// List storefront products
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by collection id
        #[arg(long)]
        collection: Option<String>,
        /// Filter by category id
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long)]
        product_type: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// Free-text search
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show one storefront product
    Get { id: String },
    /// Find a storefront product by its URL handle
    ByHandle { handle: String },
}

#[derive(Default)]
pub struct StorefrontProductHandler;

impl StorefrontProductHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: StorefrontProductCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        let outcome = match command {
            StorefrontProductCommands::List {
                page,
                collection,
                category,
                vendor,
                product_type,
                tag,
                keyword,
            } => {
                let (page, page_size) = paging(&page)?;
                let options = StorefrontProductListOptions {
                    page,
                    page_size,
                    collection,
                    category,
                    vendor,
                    product_type,
                    tag,
                    keyword,
                };
                let client = ctx.client()?;
                let payload = StorefrontProducts::new(client.as_ref())
                    .list(&options)
                    .await
                    .context("failed to list storefront products")?;
                Outcome::list("storefront products", STOREFRONT_COLUMNS, payload)
            }
            StorefrontProductCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = StorefrontProducts::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get storefront product")?;
                Outcome::record(&[], payload)
            }
            StorefrontProductCommands::ByHandle { handle } => {
                let handle = id_arg("handle", &handle)?;
                let client = ctx.client()?;
                let payload = StorefrontProducts::new(client.as_ref())
                    .by_handle(&handle)
                    .await
                    .context("failed to get storefront product by handle")?;
                Outcome::record(&[], payload)
            }
        };
        Ok(outcome)
    }
}

#[derive(Subcommand, Debug)]
pub enum TaxonomyCommands {
    /// List taxonomies
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Only children of this taxonomy
        #[arg(long)]
        parent_id: Option<String>,
    },
    /// Show one taxonomy
    Get { id: String },
    /// Create a taxonomy from a JSON body
    Create {
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Update a taxonomy from a JSON body
    Update {
        id: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a taxonomy
    Delete { id: String },
}

#[derive(Default)]
pub struct TaxonomyHandler;

impl TaxonomyHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: TaxonomyCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            TaxonomyCommands::List { page, parent_id } => {
                let (page, page_size) = paging(&page)?;
                let client = ctx.client()?;
                let payload = Taxonomies::new(client.as_ref())
                    .list(page, page_size, parent_id.as_deref())
                    .await
                    .context("failed to list taxonomies")?;
                Ok(Outcome::list("taxonomies", TAXONOMY_COLUMNS, payload))
            }
            TaxonomyCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = Taxonomies::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get taxonomy")?;
                Ok(Outcome::record(&[], payload))
            }
            TaxonomyCommands::Create { body } => {
                let body = body.require()?;
                if let Some(stop) = ctx.preflight(&Guard::new("create taxonomy"))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Taxonomies::new(client.as_ref())
                    .create(body)
                    .await
                    .context("failed to create taxonomy")?;
                Ok(Outcome::record(&[], payload))
            }
            TaxonomyCommands::Update { id, body } => {
                let id = id_arg("id", &id)?;
                let body = body.require()?;
                if let Some(stop) = ctx.preflight(&Guard::new(format!("update taxonomy {}", id)))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Taxonomies::new(client.as_ref())
                    .update(&id, body)
                    .await
                    .context("failed to update taxonomy")?;
                Ok(Outcome::record(&[], payload))
            }
            TaxonomyCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete taxonomy {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                Taxonomies::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete taxonomy")?;
                Ok(Outcome::message(format!("Deleted taxonomy {}.", id)))
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum MetafieldCommands {
    /// List metafields
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Owner type, e.g. product or customer
        #[arg(long)]
        owner_resource: Option<String>,
        #[arg(long)]
        owner_id: Option<String>,
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Show one metafield
    Get { id: String },
    /// Create a metafield from a JSON body
    Create {
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Update a metafield from a JSON body
    Update {
        id: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a metafield
    Delete { id: String },
}

#[derive(Default)]
pub struct MetafieldHandler;

impl MetafieldHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: MetafieldCommands,
        ctx: &CommandContext<'_>,
    ) -> crate::Result<Outcome> {
        match command {
            MetafieldCommands::List {
                page,
                owner_resource,
                owner_id,
                namespace,
            } => {
                let (page, page_size) = paging(&page)?;
                let options = MetafieldListOptions {
                    page,
                    page_size,
                    owner_resource,
                    owner_id,
                    namespace,
                };
                let client = ctx.client()?;
                let payload = Metafields::new(client.as_ref())
                    .list(&options)
                    .await
                    .context("failed to list metafields")?;
                Ok(Outcome::list("metafields", METAFIELD_COLUMNS, payload))
            }
            MetafieldCommands::Get { id } => {
                let id = id_arg("id", &id)?;
                let client = ctx.client()?;
                let payload = Metafields::new(client.as_ref())
                    .get(&id)
                    .await
                    .context("failed to get metafield")?;
                Ok(Outcome::record(&[], payload))
            }
            MetafieldCommands::Create { body } => {
                let body = body.require()?;
                if let Some(stop) = ctx.preflight(&Guard::new("create metafield"))? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Metafields::new(client.as_ref())
                    .create(body)
                    .await
                    .context("failed to create metafield")?;
                Ok(Outcome::record(&[], payload))
            }
            MetafieldCommands::Update { id, body } => {
                let id = id_arg("id", &id)?;
                let body = body.require()?;
                let guard = Guard::new(format!("update metafield {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                let payload = Metafields::new(client.as_ref())
                    .update(&id, body)
                    .await
                    .context("failed to update metafield")?;
                Ok(Outcome::record(&[], payload))
            }
            MetafieldCommands::Delete { id } => {
                let id = id_arg("id", &id)?;
                let guard = Guard::destructive(format!("delete metafield {}", id));
                if let Some(stop) = ctx.preflight(&guard)? {
                    return Ok(stop);
                }
                let client = ctx.client()?;
                Metafields::new(client.as_ref())
                    .delete(&id)
                    .await
                    .context("failed to delete metafield")?;
                Ok(Outcome::message(format!("Deleted metafield {}.", id)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::dispatcher::testing::harness;
    use crate::cli::main_types::Cli;
    use crate::core::guard::GuardPolicy;
    use clap::Parser;
    use reqwest::Method;
    use serde_json::json;

    fn parse(args: &[&str]) -> crate::cli::main_types::Commands {
        let mut argv = vec!["spl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse").command
    }

    #[tokio::test]
    async fn test_product_create_merges_flags_over_body() {
        let h = harness(GuardPolicy::default(), true);
        h.dispatcher
            .dispatch(parse(&[
                "products",
                "create",
                "--body",
                r#"{"title": "draft", "handle": "tote"}"#,
                "--title",
                "Canvas Tote",
                "--tags",
                "bags,summer",
            ]))
            .await
            .expect("create");

        let sent = &h.log.requests()[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.path, "/products");
        assert_eq!(
            sent.body,
            Some(json!({"title": "Canvas Tote", "handle": "tote", "tags": ["bags", "summer"]}))
        );
    }

    #[tokio::test]
    async fn test_collection_add_products_splits_ids() {
        let h = harness(GuardPolicy::default(), true);
        h.dispatcher
            .dispatch(parse(&[
                "collections",
                "add-products",
                "col_1",
                "--product-ids",
                "p1,p2",
                "--product-ids",
                "p3",
            ]))
            .await
            .expect("add products");

        let sent = &h.log.requests()[0];
        assert_eq!(sent.path, "/collections/col_1/products");
        assert_eq!(sent.body, Some(json!({"product_ids": ["p1", "p2", "p3"]})));
    }

    #[tokio::test]
    async fn test_storefront_by_handle() {
        let h = harness(GuardPolicy::default(), true);
        h.dispatcher
            .dispatch(parse(&["storefront-products", "by-handle", "canvas-tote"]))
            .await
            .expect("by handle");
        assert_eq!(
            h.log.requests()[0].path,
            "/storefront/products/handle/canvas-tote"
        );
    }

    #[tokio::test]
    async fn test_metafield_create_requires_body() {
        let h = harness(GuardPolicy::default(), true);
        let err = h
            .dispatcher
            .dispatch(parse(&["metafields", "create"]))
            .await
            .unwrap_err();
        assert_eq!(crate::core::exit_code::exit_code_for(&err), 3);
        assert!(h.log.requests().is_empty());
    }
}
