//! Application routes and the navigation surface.

use std::fmt;
use std::str::FromStr;

use parking_lot::Mutex;

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Public,
    Authenticated,
    Administrator,
}

/// Every screen of the storefront and the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Home,
    Events,
    Contact,
    Locations,
    Catalog,
    MyOrders,
    MyReservations,
    AdminDashboard,
    AdminProducts,
    AdminEvents,
    AdminLocations,
    AdminUsers,
    AdminOrders,
    AdminReservations,
    AdminMessages,
}

impl Route {
    pub const ALL: [Self; 17] = [
        Self::Login,
        Self::Register,
        Self::Home,
        Self::Events,
        Self::Contact,
        Self::Locations,
        Self::Catalog,
        Self::MyOrders,
        Self::MyReservations,
        Self::AdminDashboard,
        Self::AdminProducts,
        Self::AdminEvents,
        Self::AdminLocations,
        Self::AdminUsers,
        Self::AdminOrders,
        Self::AdminReservations,
        Self::AdminMessages,
    ];

    /// Absolute path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/registro",
            Self::Home => "/plataforma/home",
            Self::Events => "/plataforma/eventos",
            Self::Contact => "/plataforma/contacto",
            Self::Locations => "/plataforma/locales",
            Self::Catalog => "/plataforma/productos",
            Self::MyOrders => "/plataforma/mis-pedidos",
            Self::MyReservations => "/plataforma/mis-reservas",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminProducts => "/admin/productos",
            Self::AdminEvents => "/admin/eventos",
            Self::AdminLocations => "/admin/locales",
            Self::AdminUsers => "/admin/usuarios",
            Self::AdminOrders => "/admin/pedidos",
            Self::AdminReservations => "/admin/reservas",
            Self::AdminMessages => "/admin/mensajes",
        }
    }

    /// Guard protecting the route.
    #[must_use]
    pub const fn guard(self) -> Guard {
        match self {
            Self::MyOrders | Self::MyReservations => Guard::Authenticated,
            Self::AdminDashboard
            | Self::AdminProducts
            | Self::AdminEvents
            | Self::AdminLocations
            | Self::AdminUsers
            | Self::AdminOrders
            | Self::AdminReservations
            | Self::AdminMessages => Guard::Administrator,
            Self::Login
            | Self::Register
            | Self::Home
            | Self::Events
            | Self::Contact
            | Self::Locations
            | Self::Catalog => Guard::Public,
        }
    }

    /// Resolve a path. Section roots land on their default screen and
    /// anything unknown lands on home.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim().trim_matches('/');
        match trimmed {
            "" | "plataforma" => return Self::Home,
            "admin" => return Self::AdminDashboard,
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|route| route.path().trim_start_matches('/') == trimmed)
            .unwrap_or(Self::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_path(s))
    }
}

/// Where navigation requests go: a router, a terminal, a test recorder.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "Navigation requested");
    }
}

/// Navigator that remembers every request.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested route, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().clone()
    }

    /// Most recent request.
    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.history.lock().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigation recorded");
        self.history.lock().push(route);
    }
}
