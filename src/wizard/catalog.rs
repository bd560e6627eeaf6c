//! Service catalogs offered on the two selection steps.

/// One selectable service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOffering {
    pub id: &'static str,
    pub name: &'static str,
}

/// Services available today
pub const CURRENT_SERVICES: &[ServiceOffering] = &[
    ServiceOffering {
        id: "lawn-care",
        name: "Lawn Care",
    },
    ServiceOffering {
        id: "pool-maintenance",
        name: "Pool Maintenance",
    },
    ServiceOffering {
        id: "pest-control",
        name: "Pest Control",
    },
    ServiceOffering {
        id: "outdoor-cleaning",
        name: "Outdoor Cleaning",
    },
    ServiceOffering {
        id: "window-cleaning",
        name: "Window Cleaning",
    },
    ServiceOffering {
        id: "trash-bin-cleaning",
        name: "Trash Bin Cleaning",
    },
];

/// Services not planned yet, used to gauge neighborhood demand
pub const FUTURE_SERVICES: &[ServiceOffering] = &[
    ServiceOffering {
        id: "mobile-car-washing",
        name: "Mobile Car Washing",
    },
    ServiceOffering {
        id: "neighborhood-security",
        name: "Neighborhood Security",
    },
    ServiceOffering {
        id: "pressure-washing",
        name: "Pressure Washing",
    },
    ServiceOffering {
        id: "solar-panel-cleaning",
        name: "Solar Panel Cleaning",
    },
    ServiceOffering {
        id: "pet-waste-removal",
        name: "Pet Waste Removal",
    },
    ServiceOffering {
        id: "laundry-services",
        name: "Laundry Services",
    },
    ServiceOffering {
        id: "housekeeping",
        name: "Housekeeping",
    },
    ServiceOffering {
        id: "internet-service",
        name: "Internet Service",
    },
    ServiceOffering {
        id: "property-tax-appeal",
        name: "Property Tax Appeal",
    },
    ServiceOffering {
        id: "oil-and-gas-rights-revenue",
        name: "Oil and Gas Rights Revenue",
    },
];

/// Which of the two selection steps a catalog belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Current,
    Future,
}

impl ServiceKind {
    pub fn offerings(&self) -> &'static [ServiceOffering] {
        match self {
            ServiceKind::Current => CURRENT_SERVICES,
            ServiceKind::Future => FUTURE_SERVICES,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ServiceKind::Current => "What services are you interested in?",
            ServiceKind::Future => "What should we add next?",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ServiceKind::Current => "Select all that apply. We'll work to bring these to your Block.",
            ServiceKind::Future => {
                "These services aren't planned yet, but if enough neighbors want them, \
                 we'll work to make them happen in your Block."
            }
        }
    }

    /// Whether Continue needs at least one selection
    pub fn requires_selection(&self) -> bool {
        matches!(self, ServiceKind::Current)
    }

    /// Look up an offering by identifier
    pub fn find(&self, id: &str) -> Option<&'static ServiceOffering> {
        self.offerings().iter().find(|o| o.id == id)
    }
}
