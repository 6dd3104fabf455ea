/// Genome representation for the evolutionary search
///
/// A genome is one candidate request: a fixed-length sequence of raw bytes
/// written verbatim to the target service. The length is established when the
/// population is seeded (every seed is generated from the same template at
/// the same capacity) and is preserved exactly by crossover and mutation,
/// which is what keeps the whole population crossover-compatible.
///
/// # Why raw bytes instead of a structured request?
///
/// Genetic operators work best on simple, linear structures:
/// - **Crossover**: swapping segments is trivial (slice copying)
/// - **Mutation**: overwriting individual bytes is straightforward
/// - **No invalid states**: any byte sequence is a sendable request
///
/// Structure comes from the seeding side: the template engine produces
/// protocol-shaped seeds, and the search explores the byte space around them.
pub type Genome = Vec<u8>;
