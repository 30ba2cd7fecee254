pub mod drom;
