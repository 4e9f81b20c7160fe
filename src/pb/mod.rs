// @generated
pub mod tribute {
    // @@protoc_insertion_point(attribute:tribute.v1)
    pub mod v1 {
        include!("tribute.v1.rs");
        // @@protoc_insertion_point(tribute.v1)
    }
}
