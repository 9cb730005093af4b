//! A small model shared by the resolver tests.

use crate::edm::{
    Edm, EntityContainer, EnumType, Operation, PrimitiveKind, Schema, StructuredType,
};

pub(crate) fn model() -> Edm {
    let schema = Schema::new("Demo")
        .alias("D")
        .enum_type(EnumType::new("Color").member("Red", 0).member("Green", 1).member("Blue", 2))
        .enum_type(EnumType::new("Access").flags().member("Read", 1).member("Write", 2))
        .structured_type(
            StructuredType::complex("Address")
                .property("Street", "Edm.String")
                .property("City", "Edm.String")
                .nullable_property("Location", PrimitiveKind::GeographyPoint),
        )
        .structured_type(
            StructuredType::entity("Person")
                .key(["Id"])
                .property("Id", "Edm.Int32")
                .property("Name", "Edm.String")
                .nullable_property("Age", "Edm.Int32")
                .nullable_property("Born", "Edm.Date")
                .nullable_property("Address", "Demo.Address")
                .property("Tags", "Collection(Edm.String)")
                .nullable_property("FavoriteColor", "Demo.Color")
                .nullable_property("Permissions", "Demo.Access")
                .navigation("Friends", "Collection(Demo.Person)")
                .navigation("Orders", "Collection(Demo.Order)")
                .navigation("BestFriend", "Demo.Person"),
        )
        .structured_type(
            StructuredType::entity("Employee")
                .base("Demo.Person")
                .property("Salary", "Edm.Decimal")
                .navigation("Manager", "Demo.Person"),
        )
        .structured_type(
            StructuredType::entity("Order")
                .key(["Id"])
                .property("Id", "Edm.Int32")
                .property("Total", "Edm.Decimal")
                .property("Placed", "Edm.DateTimeOffset")
                .navigation("Customer", "Demo.Person")
                .navigation("Lines", "Collection(Demo.OrderLine)"),
        )
        .structured_type(
            StructuredType::entity("OrderLine")
                .key(["OrderId", "LineNo"])
                .property("OrderId", "Edm.Int32")
                .property("LineNo", "Edm.Int16")
                .property("Product", "Edm.String")
                .property("Quantity", "Edm.Int32"),
        )
        .structured_type(
            StructuredType::entity("Photo")
                .media()
                .key(["Id"])
                .property("Id", "Edm.Guid")
                .property("Title", "Edm.String"),
        )
        .structured_type(
            StructuredType::entity("Event")
                .open()
                .key(["Id"])
                .property("Id", "Edm.Int64")
                .property("Length", "Edm.Duration")
                .property("Starts", "Edm.TimeOfDay"),
        )
        .operation(
            Operation::function("FriendCount")
                .bound_to("person", "Demo.Person")
                .returns("Edm.Int32"),
        )
        .operation(
            Operation::function("Discounted")
                .bound_to("orders", "Collection(Demo.Order)")
                .parameter("percent", "Edm.Int32")
                .returns("Collection(Demo.Order)")
                .composable(),
        )
        .operation(Operation::action("Promote").bound_to("employee", "Demo.Employee"))
        .operation(
            Operation::function("Nearest")
                .parameter("lat", "Edm.Double")
                .parameter("lon", "Edm.Double")
                .returns("Collection(Demo.Person)")
                .composable(),
        )
        .operation(Operation::function("TopCustomer").returns("Demo.Person").composable())
        .operation(
            Operation::function("Greeting")
                .parameter("name", "Edm.String")
                .optional_parameter("polite", "Edm.Boolean")
                .returns("Edm.String"),
        )
        .operation(Operation::action("ResetData"));

    let container = EntityContainer::new("Service")
        .entity_set("People", "Demo.Person")
        .entity_set("Orders", "Demo.Order")
        .entity_set("OrderLines", "Demo.OrderLine")
        .entity_set("Photos", "Demo.Photo")
        .entity_set("Events", "Demo.Event")
        .singleton("Me", "Demo.Person")
        .function_import("Nearest", "Demo.Nearest")
        .function_import("TopCustomer", "Demo.TopCustomer")
        .function_import("Greeting", "Demo.Greeting")
        .action_import("ResetData", "Demo.ResetData");

    Edm::builder().schema(schema).container(container).build()
}
