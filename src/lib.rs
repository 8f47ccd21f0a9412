pub mod service {
    pub mod batch;
    pub mod config_service;
    pub mod converter;
    pub mod file;
    pub mod selection;
    pub mod traits {
        pub mod i_service;
    }
}

pub mod config {
    pub mod config;
    pub mod ports;
}

pub mod action {
    pub mod cli;
    pub mod interactive;
}

pub mod facade {
    pub mod conversion_facade;
    pub mod traits {
        pub mod i_conversion;
    }
}

pub mod models {
    pub mod conversion;
    pub mod error;
    pub mod file;
}

pub mod utils {
    pub mod utils;
}
