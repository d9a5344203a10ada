fn main() {
    // ESP-IDF link arguments apply to the on-target binary only.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
