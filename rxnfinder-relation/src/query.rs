//! Traversal query text
//!
//! The query walks from a reaction to similar reactions, then through
//! reaction-complex groupings to genes, and resolves each gene's sequence.
//! Bind variables: `@rid`, `@sf_sim`, `@df_sim`.

/// Reaction similarity edges carrying `sf_similarity` / `df_similarity` weights
pub const SIMILARITY_EDGES: &str = "rxn_similar_to_reaction";
/// Reaction -> reaction-complex membership edges
pub const REACTION_COMPLEX_EDGES: &str = "rxn_reaction_within_complex";
/// Complex -> gene membership edges
pub const GENE_COMPLEX_EDGES: &str = "rxn_gene_within_complex";
/// Gene documents holding product, function and protein translation
pub const GENE_COLLECTION: &str = "ncbi_gene";

const TRAVERSAL_TEMPLATE: &str = r#"
LET rxns = (
    FOR rxn, e IN {min_depth}..1 ANY @rid {similarity_edges}
        OPTIONS {bfs: true, uniqueVertices: "global"}
        FILTER e == null OR (e.sf_similarity >= @sf_sim AND e.df_similarity >= @df_sim)
        RETURN {
            key: rxn._key,
            name: rxn.name,
            structural_similarity: e.sf_similarity,
            difference_similarity: e.df_similarity
        }
)
LET rxn_gene_links = (
    FOR rxn IN rxns
        FOR complex IN 1..1 ANY CONCAT("rxn_reaction/", rxn.key) {complex_edges}
            LET gene_ids = UNIQUE(
                FOR gene IN 1..1 ANY complex {gene_edges}
                    RETURN gene._key
            )
            RETURN {rxn_id: rxn.key, complex_id: complex._key, gene_ids: gene_ids}
)
LET gene_ids = UNIQUE(FLATTEN(rxn_gene_links[*].gene_ids))
LET genes = (
    FOR gene_id IN gene_ids
        LET gene = DOCUMENT({gene_collection}, gene_id)
        FILTER gene != null
        RETURN {
            key: gene._key,
            product: gene.product,
            function: gene.function,
            sequence: gene.protein_translation
        }
)
RETURN {
    rxns: rxns,
    rxn_gene_links: rxn_gene_links,
    genes: genes,
    missing_genes: MINUS(gene_ids, genes[*].key)
}
"#;

/// Build the traversal query. Depth 0 keeps the query reaction in the result;
/// excluding it starts the walk at depth 1.
pub fn traversal_query(exclude_self: bool) -> String {
    let min_depth = if exclude_self { "1" } else { "0" };

    TRAVERSAL_TEMPLATE
        .replace("{min_depth}", min_depth)
        .replace("{similarity_edges}", SIMILARITY_EDGES)
        .replace("{complex_edges}", REACTION_COMPLEX_EDGES)
        .replace("{gene_edges}", GENE_COMPLEX_EDGES)
        .replace("{gene_collection}", &format!("\"{}\"", GENE_COLLECTION))
}
