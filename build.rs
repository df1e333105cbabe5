use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Embeds VERGEN_GIT_SHA / VERGEN_BUILD_DATE for `forged --version`.
    vergen_gitcl::Emitter::default()
        .add_instructions(&vergen_gitcl::BuildBuilder::default().build_date(true).build()?)?
        .add_instructions(
            &vergen_gitcl::GitclBuilder::default()
                .sha(true)
                .dirty(true)
                .build()?,
        )?
        .emit()?;
    Ok(())
}
