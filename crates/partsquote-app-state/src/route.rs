use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    RequestFlow,
    VehicleConfirmation,
    PartsSelection,
    Quotes,
    Chat,
    SupplierProfile,
    SupplierOnboarding,
    SupplierDashboard,
    AdminDashboard,
    Auth,
    HowItWorks,
    Suppliers,
    SuppliersList,
    About,
    Contact,
    Products,
    Notifications,
    History,
}

impl Page {
    pub const ALL: [Self; 19] = [
        Self::Home,
        Self::RequestFlow,
        Self::VehicleConfirmation,
        Self::PartsSelection,
        Self::Quotes,
        Self::Chat,
        Self::SupplierProfile,
        Self::SupplierOnboarding,
        Self::SupplierDashboard,
        Self::AdminDashboard,
        Self::Auth,
        Self::HowItWorks,
        Self::Suppliers,
        Self::SuppliersList,
        Self::About,
        Self::Contact,
        Self::Products,
        Self::Notifications,
        Self::History,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::RequestFlow => "request-flow",
            Self::VehicleConfirmation => "vehicle-confirmation",
            Self::PartsSelection => "parts-selection",
            Self::Quotes => "quotes",
            Self::Chat => "chat",
            Self::SupplierProfile => "supplier-profile",
            Self::SupplierOnboarding => "supplier-onboarding",
            Self::SupplierDashboard => "supplier-dashboard",
            Self::AdminDashboard => "admin-dashboard",
            Self::Auth => "auth",
            Self::HowItWorks => "how-it-works",
            Self::Suppliers => "suppliers",
            Self::SuppliersList => "suppliers-list",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Products => "products",
            Self::Notifications => "notifications",
            Self::History => "history",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.as_str() == name)
    }

    /// `request-flow` is a logical alias; it never has a path of its own.
    #[must_use]
    pub fn navigation_target(self) -> Self {
        match self {
            Self::RequestFlow => Self::VehicleConfirmation,
            page => page,
        }
    }

    #[must_use]
    pub fn to_path(self) -> &'static str {
        match self.navigation_target() {
            Self::Home => "/",
            Self::VehicleConfirmation | Self::RequestFlow => "/vehicle-confirmation",
            Self::PartsSelection => "/parts-selection",
            Self::Quotes => "/quotes",
            Self::Chat => "/chat",
            Self::SupplierProfile => "/supplier-profile",
            Self::SupplierOnboarding => "/supplier-onboarding",
            Self::SupplierDashboard => "/supplier-dashboard",
            Self::AdminDashboard => "/admin-dashboard",
            Self::Auth => "/auth",
            Self::HowItWorks => "/how-it-works",
            Self::Suppliers => "/suppliers",
            Self::SuppliersList => "/suppliers-list",
            Self::About => "/about",
            Self::Contact => "/contact",
            Self::Products => "/products",
            Self::Notifications => "/notifications",
            Self::History => "/history",
        }
    }

    /// Maps a browser path back to a page. Trailing slashes, query strings,
    /// and fragments are ignored; unknown paths resolve to `home`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Self::Home;
        }
        Self::ALL
            .into_iter()
            .find(|page| page.to_path() == trimmed)
            .map_or(Self::Home, Self::navigation_target)
    }
}

/// Unknown page names silently fall back to `home`.
#[must_use]
pub fn resolve_page(candidate: &str) -> Page {
    Page::from_name(candidate).unwrap_or_else(|| {
        tracing::debug!(candidate, "unknown page, falling back to home");
        Page::Home
    })
}

#[must_use]
pub fn page_to_path(page: Page) -> &'static str {
    page.to_path()
}
