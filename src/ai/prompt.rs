//! Documentation Prompts
//!
//! The fixed system prompt describing the report format and the user prompt
//! that wraps one source file.

/// Headings the report must contain, in order
pub const REPORT_SECTIONS: [&str; 7] = [
    "1. Overview",
    "2. Business Logic",
    "3. Inputs",
    "4. Outputs",
    "5. Dependencies",
    "6. Data Relationships (SQL/DAX only)",
    "7. Best Practices Review",
];

pub const SYSTEM_PROMPT: &str = r#"
You are a Senior Technical Documentation Specialist working for a Credit Union. 
Your job is to analyze legacy code and produce clear, professional documentation 
that both technical and non-technical stakeholders can understand.

You have deep expertise in:
- SQL stored procedures and queries
- Power BI DAX measures and calculated columns
- Python scripts
- C++ applications

When analyzing code, you understand Credit Union domain terminology including:
- Member (not "customer")
- Share accounts (savings)
- Loan types and products
- Core banking system concepts

---

When given code to analyze, produce a documentation report in Markdown format with these sections:

## 1. Overview
A 2-3 sentence plain-English summary of what this code does. Write this for a non-technical manager.

## 2. Business Logic
Explain the business rules and logic implemented in this code. What decisions does it make? What conditions does it check?

## 3. Inputs
List all inputs (parameters, variables, tables, or data sources) the code requires. Format as a table with columns: Name | Type | Description

## 4. Outputs
Describe what the code produces (result sets, calculated values, files, etc.). Format as a table with columns: Name | Type | Description

## 5. Dependencies
List any external dependencies (other procedures, tables, views, functions, or services) this code relies on.

## 6. Data Relationships (SQL/DAX only)
If the code contains joins, explain each join:
- Which tables are being joined
- What type of join (INNER, LEFT, RIGHT, FULL)
- The join condition (which columns link the tables)
- Why this relationship likely exists from a business perspective

## 7. Best Practices Review
Evaluate the code against modern best practices. Provide specific, actionable recommendations for improvement in areas such as:
- Readability and naming conventions
- Performance optimization
- Error handling
- Security considerations
- Maintainability

---

Keep your tone professional but accessible. Avoid unnecessary jargon.
"#;

const USER_PROMPT_TEMPLATE: &str = r#"
Please analyze the following {language} code and generate a documentation report.

**File Name:** {filename}

**Code:**
```{language}
{code_content}
```

Generate the documentation report now.
"#;

/// Fill the user prompt template for one source file
pub fn user_prompt(language: &str, filename: &str, code_content: &str) -> String {
    // Code goes last so placeholders inside it are left alone
    USER_PROMPT_TEMPLATE
        .replace("{language}", language)
        .replace("{filename}", filename)
        .replacen("{code_content}", code_content, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_every_section() {
        for section in REPORT_SECTIONS {
            assert!(
                SYSTEM_PROMPT.contains(&format!("## {}", section)),
                "missing {section}"
            );
        }
        assert!(SYSTEM_PROMPT.contains("Credit Union"));
    }

    #[test]
    fn test_system_prompt_wording() {
        assert!(SYSTEM_PROMPT.starts_with(
            "\nYou are a Senior Technical Documentation Specialist working for a Credit Union. \n"
        ));
        assert!(SYSTEM_PROMPT.contains("You have deep expertise in:\n- SQL stored procedures and queries"));
        assert!(SYSTEM_PROMPT.contains(
            "A 2-3 sentence plain-English summary of what this code does. Write this for a non-technical manager."
        ));
        assert!(SYSTEM_PROMPT.contains("- Member (not \"customer\")"));
        assert!(SYSTEM_PROMPT.ends_with("Avoid unnecessary jargon.\n"));
    }

    #[test]
    fn test_user_prompt_fills_placeholders() {
        let prompt = user_prompt("SQL", "loans.sql", "SELECT * FROM loans;");
        assert!(prompt.contains("following SQL code"));
        assert!(prompt.contains("**File Name:** loans.sql"));
        assert!(prompt.contains("```SQL\nSELECT * FROM loans;\n```"));
        assert!(!prompt.contains("{language}"));
    }

    #[test]
    fn test_code_placeholders_are_not_expanded() {
        let prompt = user_prompt("Python", "fmt.py", "print('{filename}')");
        assert!(prompt.contains("print('{filename}')"));
    }
}
