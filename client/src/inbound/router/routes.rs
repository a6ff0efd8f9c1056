//! Static route table.

use crate::domain::{Role, RouteMeta};

/// What a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// Render the named view component.
    View(&'static str),
    /// Continue navigation at another path.
    Redirect(&'static str),
}

/// One entry of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Pattern, possibly with `:param` segments.
    pub path: &'static str,
    pub name: &'static str,
    pub target: RouteTarget,
    pub meta: RouteMeta,
}

pub const ROOT_PATH: &str = "/";
pub const HOME_PATH: &str = "/home";
pub const LOGIN_PATH: &str = "/login";

const STAFF: &[Role] = &[Role::Admin, Role::Store, Role::Property];
const ADMIN: &[Role] = &[Role::Admin];
const MERCHANT: &[Role] = &[Role::Admin, Role::Store];
const ESTATE: &[Role] = &[Role::Admin, Role::Property];

const fn view(
    path: &'static str,
    name: &'static str,
    component: &'static str,
    meta: RouteMeta,
) -> Route {
    Route {
        path,
        name,
        target: RouteTarget::View(component),
        meta,
    }
}

/// Every navigable path of the client.
pub static ROUTES: &[Route] = &[
    Route {
        path: ROOT_PATH,
        name: "Root",
        target: RouteTarget::Redirect(HOME_PATH),
        meta: RouteMeta::PUBLIC,
    },
    view("/data", "DataScreen", "admin/DataScreen", RouteMeta::PUBLIC),
    view(LOGIN_PATH, "Login", "auth/Login", RouteMeta::PUBLIC_BARE),
    view("/register", "Register", "auth/Register", RouteMeta::PUBLIC_BARE),
    view(HOME_PATH, "Home", "home/Index", RouteMeta::PUBLIC),
    view("/mall", "Mall", "mall/Index", RouteMeta::PUBLIC),
    view("/product/:id", "ProductDetail", "mall/ProductDetail", RouteMeta::PUBLIC),
    view("/cart", "Cart", "mall/Cart", RouteMeta::AUTHENTICATED),
    view("/order", "Order", "order/Index", RouteMeta::AUTHENTICATED),
    view("/order/create", "CreateOrder", "order/Create", RouteMeta::AUTHENTICATED),
    view("/service", "Service", "service/Index", RouteMeta::PUBLIC),
    view("/service/notice", "Notice", "service/Notice", RouteMeta::PUBLIC),
    view("/service/repair", "Repair", "service/Repair", RouteMeta::AUTHENTICATED),
    view("/service/visitor", "Visitor", "service/Visitor", RouteMeta::AUTHENTICATED),
    view("/service/parking", "Parking", "service/Parking", RouteMeta::AUTHENTICATED),
    view("/service/property", "PropertyFee", "service/PropertyFee", RouteMeta::AUTHENTICATED),
    view("/profile", "Profile", "profile/Index", RouteMeta::AUTHENTICATED),
    view("/admin", "Admin", "admin/Index", RouteMeta::admin(STAFF)),
    view("/user/favorites", "FavoriteList", "user/FavoriteList", RouteMeta::AUTHENTICATED),
    view("/user/transactions", "TransactionList", "user/TransactionList", RouteMeta::AUTHENTICATED),
    view("/admin/users", "AdminUserList", "admin/UserList", RouteMeta::admin(ADMIN)),
    view("/admin/products", "AdminProductList", "admin/ProductList", RouteMeta::admin(MERCHANT)),
    view("/admin/orders", "AdminOrderList", "admin/OrderList", RouteMeta::admin(MERCHANT)),
    view("/admin/stores", "AdminStoreList", "admin/StoreList", RouteMeta::admin(MERCHANT)),
    view("/admin/notices", "AdminNoticeList", "admin/NoticeList", RouteMeta::admin(ESTATE)),
    view("/admin/repairs", "AdminRepairList", "admin/RepairList", RouteMeta::admin(ESTATE)),
    view("/admin/visitors", "AdminVisitorList", "admin/VisitorList", RouteMeta::admin(ESTATE)),
    view("/admin/parking", "AdminParkingList", "admin/ParkingList", RouteMeta::admin(ESTATE)),
    view(
        "/admin/property-fee",
        "AdminPropertyFeeList",
        "admin/PropertyFeeList",
        RouteMeta::admin(ESTATE),
    ),
];
