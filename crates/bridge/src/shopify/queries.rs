//! GraphQL documents for the Shopify Admin API.
//!
//! Documents are compile-time strings; shared selections are spliced in
//! with `concat!` through the field macros below.

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Operation name, sent as `operationName`.
    pub name: &'static str,
    /// Document text.
    pub document: &'static str,
}

macro_rules! translatable_fields {
    () => {
        "id title handle translations(locale: $locale) { key value locale }"
    };
}

macro_rules! product_fields {
    () => {
        concat!(
            "id title handle description ",
            "images(first: 1) { edges { node { src } } } ",
            "translations(locale: $locale) { key value locale }"
        )
    };
}

macro_rules! list_document {
    ($name:literal, $root:literal, $fields:expr) => {
        concat!(
            "query ",
            $name,
            "($first: Int!, $after: String, $locale: String!, $query: String) { ",
            $root,
            "(first: $first, after: $after, query: $query) { ",
            "edges { cursor node { ",
            $fields,
            " } } pageInfo { hasNextPage endCursor } } }"
        )
    };
}

macro_rules! by_ids_document {
    ($name:literal, $type:literal, $fields:expr) => {
        concat!(
            "query ",
            $name,
            "($ids: [ID!]!, $locale: String!) { nodes(ids: $ids) { ... on ",
            $type,
            " { ",
            $fields,
            " } } }"
        )
    };
}

// =============================================================================
// Collections (categories)
// =============================================================================

pub const LIST_COLLECTIONS: Operation = Operation {
    name: "getCategories",
    document: list_document!("getCategories", "collections", translatable_fields!()),
};

pub const COLLECTIONS_BY_IDS: Operation = Operation {
    name: "getCategoriesByIds",
    document: by_ids_document!("getCategoriesByIds", "Collection", translatable_fields!()),
};

pub const COUNT_COLLECTIONS: Operation = Operation {
    name: "CollectionsCount",
    document: r#"query CollectionsCount { collectionsCount(query: "collection_type:custom") { count } }"#,
};

pub const COLLECTION_ID_BY_HANDLE: Operation = Operation {
    name: "getCollectionByHandle",
    document: "query getCollectionByHandle($handle: String!) { collectionByHandle(handle: $handle) { id } }",
};

pub const COLLECTION_HANDLE_BY_ID: Operation = Operation {
    name: "getCollectionById",
    document: "query getCollectionById($id: ID!) { collection(id: $id) { handle } }",
};

// =============================================================================
// Pages (content)
// =============================================================================

pub const LIST_PAGES: Operation = Operation {
    name: "getPages",
    document: list_document!("getPages", "pages", translatable_fields!()),
};

pub const PAGES_BY_IDS: Operation = Operation {
    name: "getPagesByIds",
    document: by_ids_document!("getPagesByIds", "Page", translatable_fields!()),
};

pub const COUNT_PAGES: Operation = Operation {
    name: "PagesCount",
    document: "query PagesCount { pagesCount { count } }",
};

/// The Admin API has no `pageByHandle`; handles are found by scanning this listing.
pub const SCAN_PAGE_HANDLES: Operation = Operation {
    name: "getPageHandles",
    document: concat!(
        "query getPageHandles($first: Int!, $after: String) { ",
        "pages(first: $first, after: $after) { ",
        "edges { node { id handle } } pageInfo { hasNextPage endCursor } } }"
    ),
};

pub const PAGE_HANDLE_BY_ID: Operation = Operation {
    name: "getPageById",
    document: "query getPageById($id: ID!) { page(id: $id) { handle } }",
};

pub const PAGE_TRANSLATION_DIGESTS: Operation = Operation {
    name: "getPageTranslations",
    document: concat!(
        "query getPageTranslations($resourceId: ID!) { ",
        "translatableResource(resourceId: $resourceId) { ",
        "translatableContent { key value digest locale } } }"
    ),
};

pub const REGISTER_TRANSLATIONS: Operation = Operation {
    name: "translationsRegister",
    document: concat!(
        "mutation translationsRegister($resourceId: ID!, $translations: [TranslationInput!]!) { ",
        "translationsRegister(resourceId: $resourceId, translations: $translations) { ",
        "userErrors { message field } translations { key value } } }"
    ),
};

pub const CREATE_PAGE: Operation = Operation {
    name: "CreatePage",
    document: concat!(
        "mutation CreatePage($page: PageCreateInput!) { pageCreate(page: $page) { ",
        "page { id title handle } userErrors { code field message } } }"
    ),
};

pub const UPDATE_PAGE: Operation = Operation {
    name: "UpdatePage",
    document: concat!(
        "mutation UpdatePage($id: ID!, $page: PageUpdateInput!) { pageUpdate(id: $id, page: $page) { ",
        "page { id title handle } userErrors { code field message } } }"
    ),
};

pub const DELETE_PAGE: Operation = Operation {
    name: "pageDelete",
    document: concat!(
        "mutation pageDelete($id: ID!) { pageDelete(id: $id) { ",
        "deletedPageId userErrors { field message } } }"
    ),
};

// =============================================================================
// Products
// =============================================================================

pub const LIST_PRODUCTS: Operation = Operation {
    name: "getProducts",
    document: list_document!("getProducts", "products", product_fields!()),
};

pub const PRODUCTS_BY_IDS: Operation = Operation {
    name: "getProductsByIds",
    document: by_ids_document!("getProductsByIds", "Product", product_fields!()),
};

pub const COUNT_PRODUCTS: Operation = Operation {
    name: "ProductsCount",
    document: "query ProductsCount { productsCount { count } }",
};

pub const PRODUCT_ID_BY_HANDLE: Operation = Operation {
    name: "getProductByHandle",
    document: "query getProductByHandle($handle: String!) { productByHandle(handle: $handle) { id } }",
};

pub const PRODUCT_HANDLE_BY_ID: Operation = Operation {
    name: "getProductById",
    document: "query getProductById($id: ID!) { node(id: $id) { ... on Product { handle } } }",
};
