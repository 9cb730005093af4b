//! A shop model used across the integration tests.

use once_cell::sync::Lazy;
use odata::edm::{Edm, EntityContainer, EnumType, Operation, PrimitiveKind, Schema, StructuredType};
use odata::{Error, ODataUri, ResourcePath};

pub static MODEL: Lazy<Edm> = Lazy::new(build);

fn build() -> Edm {
    let schema = Schema::new("Shop.Model")
        .alias("Shop")
        .enum_type(
            EnumType::new("Status")
                .member("Open", 0)
                .member("Shipped", 1)
                .member("Closed", 2),
        )
        .structured_type(
            StructuredType::complex("Address")
                .property("Street", "Edm.String")
                .property("City", "Edm.String")
                .nullable_property("Position", PrimitiveKind::GeographyPoint),
        )
        .structured_type(
            StructuredType::entity("Category")
                .key(["Id"])
                .property("Id", "Edm.Int32")
                .property("Name", "Edm.String")
                .navigation("Products", "Collection(Shop.Model.Product)"),
        )
        .structured_type(
            StructuredType::entity("Product")
                .key(["Id"])
                .property("Id", "Edm.Int32")
                .property("Name", "Edm.String")
                .property("Price", "Edm.Decimal")
                .nullable_property("Released", "Edm.Date")
                .nullable_property("Warranty", "Edm.Duration")
                .navigation("Category", "Shop.Model.Category"),
        )
        .structured_type(
            StructuredType::entity("Customer")
                .key(["Id"])
                .property("Id", "Edm.String")
                .property("Name", "Edm.String")
                .nullable_property("Address", "Shop.Model.Address")
                .navigation("Orders", "Collection(Shop.Model.Order)"),
        )
        .structured_type(
            StructuredType::entity("VipCustomer")
                .base("Shop.Model.Customer")
                .property("Discount", "Edm.Decimal"),
        )
        .structured_type(
            StructuredType::entity("Order")
                .key(["Id"])
                .property("Id", "Edm.Int32")
                .property("Placed", "Edm.DateTimeOffset")
                .property("Status", "Shop.Model.Status")
                .navigation("Customer", "Shop.Model.Customer")
                .navigation("Lines", "Collection(Shop.Model.OrderLine)"),
        )
        .structured_type(
            StructuredType::entity("OrderLine")
                .key(["k1", "k2"])
                .property("k1", "Edm.Int32")
                .property("k2", "Edm.String")
                .property("Quantity", "Edm.Int32")
                .navigation("Product", "Shop.Model.Product"),
        )
        .operation(
            Operation::function("MostExpensive")
                .bound_to("products", "Collection(Shop.Model.Product)")
                .returns("Shop.Model.Product")
                .composable(),
        )
        .operation(
            Operation::function("Reorder")
                .bound_to("order", "Shop.Model.Order")
                .parameter("count", "Edm.Int32")
                .optional_parameter("note", "Edm.String")
                .returns("Shop.Model.Order"),
        )
        .operation(Operation::action("Ship").bound_to("order", "Shop.Model.Order"))
        .operation(
            Operation::function("ProductsByPrice")
                .parameter("min", "Edm.Decimal")
                .returns("Collection(Shop.Model.Product)")
                .composable(),
        );

    let container = EntityContainer::new("ShopService")
        .entity_set("Products", "Shop.Model.Product")
        .entity_set("Categories", "Shop.Model.Category")
        .entity_set("Customers", "Shop.Model.Customer")
        .entity_set("Orders", "Shop.Model.Order")
        .entity_set("OrderLines", "Shop.Model.OrderLine")
        .singleton("Cheapest", "Shop.Model.Product")
        .function_import("ProductsByPrice", "Shop.Model.ProductsByPrice");

    Edm::builder().schema(schema).container(container).build()
}

pub fn parse(uri: &str) -> Result<ODataUri, Error> {
    odata::parse_uri(uri, &*MODEL)
}

pub fn parse_path(path: &str) -> Result<ResourcePath, Error> {
    odata::parse_resource_path(path, &*MODEL)
}
