//! Entity implementation

slotmap::new_key_type! {
    /// Generational entity handle
    ///
    /// A destroyed entity's slot can be reused, but the generation changes,
    /// so an old handle never resolves to the new occupant.
    pub struct Entity;
}
